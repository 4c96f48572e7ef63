// THEORY:
// Under a point light, the shadow of a flat object grows as the object rises
// toward the light. With the light `L` above the surface and the object `h`
// above it, every shadow edge is magnified by `L / (L - h)`, so the area scales
// by the square of that factor. A baseline captured with the object resting on
// the surface (h = 0) gives the reference area, and any later area inverts to
//
//     h = L * (1 - sqrt(reference / observed))
//
// The result is clamped to `[0, L)`: a shadow smaller than the baseline reads as
// "touching", and no finite area can place the object at the light itself.

/// Height of the object above the surface, in the units of `light_distance`.
///
/// Returns `None` when any input is not strictly positive or not finite.
pub fn estimate_height(light_distance: f64, reference_area: f64, observed_area: f64) -> Option<f64> {
    let inputs = [light_distance, reference_area, observed_area];
    if inputs.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return None;
    }
    let height = light_distance * (1.0 - (reference_area / observed_area).sqrt());
    Some(height.clamp(0.0, light_distance * (1.0 - f64::EPSILON)))
}

/// The shadow area expected at `height`, the forward form of `estimate_height`.
pub fn expected_area(light_distance: f64, reference_area: f64, height: f64) -> Option<f64> {
    if !(light_distance > 0.0 && reference_area > 0.0 && height >= 0.0 && height < light_distance) {
        return None;
    }
    let magnification = light_distance / (light_distance - height);
    Some(reference_area * magnification * magnification)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_area_means_touching() {
        assert_eq!(estimate_height(100.0, 400.0, 400.0), Some(0.0));
    }

    #[test]
    fn quadrupled_area_is_half_way() {
        // Magnification 2 means L / (L - h) = 2.
        let height = estimate_height(100.0, 400.0, 1600.0).unwrap();
        assert!((height - 50.0).abs() < 1e-9);
    }

    #[test]
    fn forward_and_inverse_agree() {
        let area = expected_area(80.0, 250.0, 20.0).unwrap();
        let height = estimate_height(80.0, 250.0, area).unwrap();
        assert!((height - 20.0).abs() < 1e-9);
    }

    #[test]
    fn shrinking_shadow_clamps_to_surface() {
        assert_eq!(estimate_height(100.0, 400.0, 300.0), Some(0.0));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(estimate_height(0.0, 400.0, 400.0), None);
        assert_eq!(estimate_height(100.0, 0.0, 400.0), None);
        assert_eq!(estimate_height(100.0, 400.0, -1.0), None);
        assert_eq!(estimate_height(f64::NAN, 400.0, 400.0), None);
        assert_eq!(expected_area(100.0, 400.0, 100.0), None);
    }
}
