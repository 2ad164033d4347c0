pub mod vader;

pub use vader::VaderPolarity;
