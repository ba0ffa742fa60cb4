pub mod editor;
pub mod health;
pub mod notes;
