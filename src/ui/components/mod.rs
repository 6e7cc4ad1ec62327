pub mod assessment_summary;
pub mod badges;
pub mod device_table;
pub mod kpi_card;
pub mod order_card;
pub mod part_table;
pub mod price_editor;
pub mod toast;
