pub mod bar;
pub mod click_areas;
pub mod components;
