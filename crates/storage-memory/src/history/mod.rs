mod repository;

pub use repository::MemoryValuationRepository;
