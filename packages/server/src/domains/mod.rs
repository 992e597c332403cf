// Business domains
pub mod harvesting;
