pub mod ack;
pub mod activate;
pub mod frames;
pub mod health;
