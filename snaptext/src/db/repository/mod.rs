mod extractions;

pub use extractions::ExtractionRepository;
