//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod daily_record;
pub mod product;
pub mod session;
pub mod user;

// Re-export specific types to avoid conflicts
pub use daily_record::{
    Column as DailyRecordColumn, Entity as DailyRecord, Model as DailyRecordModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
