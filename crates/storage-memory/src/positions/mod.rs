mod repository;

pub use repository::MemoryPositionRepository;
