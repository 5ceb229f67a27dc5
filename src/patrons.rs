use crate::core::domain::Identifiable;

pub mod domain;
pub mod dto;
pub mod factory;
pub mod repository;

pub trait Patron: Identifiable {
    fn fine_balance(&self) -> f64;
    fn loan_count(&self) -> usize;
}
