pub mod backup;
pub mod check;
pub mod restore;
pub mod sync;
