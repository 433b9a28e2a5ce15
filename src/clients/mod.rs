pub mod wttr;
