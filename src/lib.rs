pub mod bands;
pub mod formatting;
pub mod language;
pub mod parsing;
pub mod reference;
pub mod templating;
