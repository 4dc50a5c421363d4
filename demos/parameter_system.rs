//! Example demonstrating the unit-aware parameter system
//!
//! This example sets up a small magneto-optics model in a nanometre and
//! picosecond basis, defines derived and invertible parameters, propagates an
//! assignment back through them and saves the result as a JSON profile.

use scaled_params::parameters::{Bounds, ParamFunction, Parameters, ParametersConfig};
use scaled_params::Result;

/// `omega = 2 pi c / wavelength`, inverted to recover the wavelength
fn angular_frequency() -> ParamFunction {
    const C_NM_PER_PS: f64 = 299_792.458;
    ParamFunction::new(&["wavelength", "omega"], |args| match args.target() {
        None => Ok((2.0 * std::f64::consts::PI * C_NM_PER_PS / args.scaled("wavelength")?).into()),
        Some(_) => Ok((2.0 * std::f64::consts::PI * C_NM_PER_PS / args.scaled("omega")?).into()),
    })
}

fn main() -> Result<()> {
    let config = ParametersConfig::new().with_constants(true);
    let mut params = Parameters::with_config(config)?;

    // Internal basis: lengths in nm, times in ps
    let skipped = params.scale_dimensions([("length", (1.0, "nm")), ("time", (1.0, "ps"))])?;
    assert!(skipped.is_empty());

    params.define([
        ("wavelength", (800.0, "nm")),
        ("thickness", (0.25, "µm")),
        ("field", (50.0, "mT")),
    ])?;
    params.define([("omega", (angular_frequency(), "1/ps"))])?;
    params.define([("zeeman", ("mu_B * field", "eV"))])?;
    params.define([("optical_path", ("thickness * 1.5", "nm"))])?;
    params.set_bounds("wavelength", [Bounds::new(200.0, 2000.0)?])?;

    println!("Initial parameters:");
    println!("{}", params);

    println!("\nScaled wavelength: {}", params.scaled("wavelength")?);
    println!("Unit-aware thickness: {}", params.quantity("thickness")?);
    println!("Zeeman splitting: {}", params.quantity("zeeman")?);

    // Temporary override, nothing is stored
    let shifted = params.get_with("omega", [("wavelength", (1.0, "µm"))])?;
    println!("\nomega at 1 µm: {}", shifted);

    // Sweep the wavelength
    let sweep = params.range("omega", "wavelength", [400.0, 600.0, 800.0])?;
    for (wavelength, omega) in [400.0, 600.0, 800.0].iter().zip(&sweep) {
        println!("  wavelength = {} nm -> omega = {}", wavelength, omega);
    }

    // Assigning the derived parameter updates the wavelength it depends on
    params.set("omega", 1500.0)?;
    println!("\nAfter setting omega = 1500 rad/ps:");
    println!("  wavelength = {}", params.quantity("wavelength")?);

    // Out-of-bounds assignments are rejected as a whole
    if let Err(err) = params.set("omega", 100.0) {
        println!("  rejected: {}", err);
    }

    println!("\nFinal parameters:");
    println!("{}", params);
    println!("\nProfile:\n{}", params.to_json()?);

    Ok(())
}
