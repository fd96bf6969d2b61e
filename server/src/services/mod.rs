pub mod token_evictor;
