pub mod iou_linkage_builder;
