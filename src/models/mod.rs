pub mod account;
pub mod catalog;
pub mod page;

pub use page::Page;
