/// Outbound adapters - Infrastructure implementations
pub mod console;
pub mod filesystem;
pub mod pnpm;
