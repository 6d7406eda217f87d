pub mod custom;
pub mod depth;
pub mod exchanges;
pub mod history;
pub mod info;
