//! Physical constants preloaded on request

/// Name, magnitude and unit of each preloaded constant
pub const PHYSICAL_CONSTANTS: &[(&str, f64, &str)] = &[
    ("h", 6.62606957e-34, "J*s"),
    ("hbar", 1.054571726e-34, "J*s"),
    ("e", 1.602176565e-19, "C"),
    ("pi", std::f64::consts::PI, ""),
    ("mu_B", 9.274e-24, "J/T"),
];
