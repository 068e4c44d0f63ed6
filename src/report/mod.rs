mod buckets;
mod render;

pub use buckets::Buckets;
pub use render::{ReportContext, render_wip_email};
