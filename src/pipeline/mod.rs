pub mod stage1_timing;
pub mod stage2_labels;
pub mod stage3_aggregate;
pub mod stage4_metrics;
pub mod stage5_report;
