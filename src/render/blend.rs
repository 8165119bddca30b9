/// Premultiplied RGBA8 pixel, channel order `[r, g, b, a]`.
pub type PremulRgba8 = [u8; 4];

/// Source-over for two packed premultiplied `0xAARRGGBB` pixels:
/// `out = src + dst * (1 - src.a)` on every channel, alpha included.
pub fn over(dst: u32, src: u32) -> u32 {
    let sa = src >> 24;
    match sa {
        0 => dst,
        255 => src,
        _ => {
            let keep = 255 - sa;
            [0u32, 8, 16, 24].into_iter().fold(0, |out, shift| {
                let s = (src >> shift) & 0xff;
                let d = (dst >> shift) & 0xff;
                out | ((s + scale255(d, keep)).min(255) << shift)
            })
        }
    }
}

/// `round(c * k / 255)` for `c, k <= 255`, without a division.
fn scale255(c: u32, k: u32) -> u32 {
    let t = c * k + 128;
    (t + (t >> 8)) >> 8
}

/// Back to straight alpha. Transparent pixels become all-zero.
pub fn unpremultiply(px: PremulRgba8) -> [u8; 4] {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

/// Pulls color channels down to alpha after filtering that can overshoot.
pub fn clamp_premul(px: PremulRgba8) -> PremulRgba8 {
    let a = px[3];
    [px[0].min(a), px[1].min(a), px[2].min(a), a]
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
