pub mod markup;
pub mod panels;
pub mod settings;
pub mod viewer;
