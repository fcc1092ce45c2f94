pub mod mongo;
pub mod db_init;
