//! Router tests module

mod routing_tests;
mod selection_tests;
