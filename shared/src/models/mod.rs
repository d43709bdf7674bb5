//! 领域模型
//!
//! # 模块结构
//!
//! - [`Restaurant`] - 餐厅（预约核心只读取，不拥有）
//! - [`DiningTable`] - 桌台：容量 + 可预约时段
//! - [`Booking`] - 预约记录（账本唯一写入对象）

pub mod booking;
pub mod dining_table;
pub mod restaurant;

pub use booking::{Booking, BookingStatus};
pub use dining_table::{DiningTable, DiningTableCreate};
pub use restaurant::{Restaurant, RestaurantCreate};
