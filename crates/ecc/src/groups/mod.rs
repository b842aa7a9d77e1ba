pub mod affine_element;
pub mod curve_params;
pub mod element;
