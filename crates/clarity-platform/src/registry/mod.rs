pub mod clinical_tables;

pub use clinical_tables::ClinicalTablesRegistry;
