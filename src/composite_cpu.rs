use crate::SashResult;

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> SashResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(crate::SashError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite a solid `color` through a coverage mask placed at `(x0, y0)` in `dst`.
///
/// Mask pixels outside the destination are dropped.
#[allow(clippy::too_many_arguments)]
pub fn tint_mask_over(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    mask: &[u8],
    mask_width: u32,
    x0: i32,
    y0: i32,
    color_premul: PremulRgba8,
) -> SashResult<()> {
    if mask_width == 0 || !mask.len().is_multiple_of(mask_width as usize) {
        return Err(crate::SashError::validation(
            "tint_mask_over expects a whole number of mask rows",
        ));
    }
    let mask_height = (mask.len() / mask_width as usize) as u32;
    for my in 0..mask_height {
        let y = y0 + my as i32;
        if y < 0 || y >= dst_height as i32 {
            continue;
        }
        for mx in 0..mask_width {
            let x = x0 + mx as i32;
            if x < 0 || x >= dst_width as i32 {
                continue;
            }
            let m = mask[(my * mask_width + mx) as usize];
            if m == 0 {
                continue;
            }
            let src = [
                mul_div255(u16::from(color_premul[0]), u16::from(m)),
                mul_div255(u16::from(color_premul[1]), u16::from(m)),
                mul_div255(u16::from(color_premul[2]), u16::from(m)),
                mul_div255(u16::from(color_premul[3]), u16::from(m)),
            ];
            let idx = ((y as usize) * (dst_width as usize) + x as usize) * 4;
            let d = [dst[idx], dst[idx + 1], dst[idx + 2], dst[idx + 3]];
            dst[idx..idx + 4].copy_from_slice(&over(d, src, 1.0));
        }
    }
    Ok(())
}

pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_opacity_0_is_noop() {
        let dst = [1, 2, 3, 4];
        let src = [200, 200, 200, 200];
        assert_eq!(over(dst, src, 0.0), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src, 1.0), src);
    }

    #[test]
    fn over_dst_transparent_returns_scaled_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 200];
        assert_eq!(over(dst, src, 1.0), src);
    }

    #[test]
    fn tint_mask_clips_to_destination() {
        let mut dst = vec![255u8; 2 * 2 * 4];
        let mask = vec![255u8; 3 * 3];
        tint_mask_over(&mut dst, 2, 2, &mask, 3, 1, 1, [0, 0, 0, 255]).unwrap();
        assert_eq!(&dst[0..4], &[255, 255, 255, 255]);
        assert_eq!(&dst[12..16], &[0, 0, 0, 255]);
    }

    #[test]
    fn unpremultiply_restores_straight_alpha() {
        let mut px = vec![64u8, 32, 0, 128];
        unpremultiply_in_place(&mut px);
        assert_eq!(px, vec![128, 64, 0, 128]);
    }
}
