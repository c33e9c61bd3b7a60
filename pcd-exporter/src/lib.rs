pub mod las;
