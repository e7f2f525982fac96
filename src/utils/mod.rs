// Utils module - Utility functions

pub mod shutdown;
