pub mod ctakes;
