pub mod orders;

pub use orders::OrderRepository;
