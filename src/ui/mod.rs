pub mod components;
pub mod guard;
pub mod pages;
pub mod shell;
pub mod theme;
