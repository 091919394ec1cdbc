pub mod report;
pub mod rotator;
pub mod scraper;
