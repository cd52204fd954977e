pub mod document;
pub mod language;
pub mod loaders;
pub mod section;
pub mod section1;

pub use document::Document;
pub use language::Language;
pub use loaders::{load_section1_form, load_section_specs};
pub use section::{
    default_section_specs, validate_specs, Context, ErrorKind, GenerationResult, Outcome,
    ResultSet, SectionSpec,
};
pub use section1::Section1Form;
