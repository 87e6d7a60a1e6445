// ABOUTME: SeaORM entities module for database models and relationships
// ABOUTME: Exports entity definitions for users, rolls, frames, and equipment

pub mod camera;
pub mod filter;
pub mod frame;
pub mod lens;
pub mod roll;
pub mod user;

pub use camera::Entity as Camera;
pub use filter::Entity as Filter;
pub use frame::Entity as Frame;
pub use lens::Entity as Lens;
pub use roll::Entity as Roll;
pub use user::Entity as User;
