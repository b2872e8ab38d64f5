// Domain model for record extraction

pub mod definition;
