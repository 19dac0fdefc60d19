mod repository;

pub use repository::MemoryPortfolioRepository;
