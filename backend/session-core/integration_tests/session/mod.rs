mod device;
mod execute;
mod helpers;
