pub mod fare;
pub mod seat;
pub mod train;
pub mod user;

pub use fare::Fares;
pub use seat::{SeatCode, SeatState, SeatStatus};
pub use train::{TrainInfo, TrainKind};
pub use user::User;
