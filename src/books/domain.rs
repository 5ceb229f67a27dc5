use crate::core::domain::Identifiable;

pub mod model;

pub trait Book: Identifiable {
    fn available_copies(&self) -> u32;

    fn is_available(&self) -> bool {
        self.available_copies() > 0
    }
}
