// Backend adapters

pub mod pg_profile_store;
pub mod supabase;
