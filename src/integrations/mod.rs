// src/integrations/mod.rs
//
// External Integrations Module

pub mod supabase;

pub use supabase::client::SupabaseClient;
