//! CLI command implementations.

use anyhow::{anyhow, Context, Result};
use clap::Args;

use math3d_core::kernel::{self, vector};
use math3d_core::{BoxStack, LinearValue, ViewVolume};

/// Clip planes of a projection volume.
#[derive(Args)]
pub struct VolumeArgs {
    #[arg(allow_hyphen_values = true)]
    left: f32,
    #[arg(allow_hyphen_values = true)]
    right: f32,
    #[arg(allow_hyphen_values = true)]
    bottom: f32,
    #[arg(allow_hyphen_values = true)]
    top: f32,
    #[arg(allow_hyphen_values = true)]
    near: f32,
    #[arg(allow_hyphen_values = true)]
    far: f32,
}

impl VolumeArgs {
    fn volume(&self) -> ViewVolume {
        ViewVolume::new(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

fn parse_list(text: &str) -> Result<Vec<f32>> {
    text.split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .with_context(|| format!("invalid number '{part}' in '{text}'"))
        })
        .collect()
}

fn parse_floats<const N: usize>(text: &str) -> Result<[f32; N]> {
    let values = parse_list(text)?;
    let found = values.len();
    values
        .try_into()
        .map_err(|_| anyhow!("expected {N} comma-separated numbers, got {found}"))
}

/// Print every live stack value, bottom first.
pub fn print_stack(bs: &BoxStack) {
    for (_, tag, data) in bs.stack().iter() {
        let items: Vec<String> = data.iter().map(|x| format!("{x}")).collect();
        println!("{tag} [{}]", items.join(", "));
    }
}

pub fn srt(bs: &mut BoxStack, scale: &str, rotation: &str, translation: &str) -> Result<()> {
    let s = parse_floats::<3>(scale).context("scale")?;
    let r = parse_floats::<4>(rotation).context("rotation")?;
    let t = parse_floats::<3>(translation).context("translation")?;
    kernel::make_srt(bs.stack_mut(), &s, &r, &t)?;
    Ok(())
}

pub fn decompose(bs: &mut BoxStack, matrix: &str) -> Result<()> {
    let m = parse_floats::<16>(matrix)?;
    kernel::decompose_matrix(bs.stack_mut(), &m)?;
    Ok(())
}

pub fn inverse(bs: &mut BoxStack, matrix: &str) -> Result<()> {
    let m = parse_floats::<16>(matrix)?;
    if kernel::matrix::try_inverse(&m).is_none() {
        tracing::warn!("matrix is singular; result is the zero matrix");
    }
    kernel::inverse_matrix(bs.stack_mut(), &m)?;
    Ok(())
}

pub fn transpose(bs: &mut BoxStack, matrix: &str) -> Result<()> {
    let m = parse_floats::<16>(matrix)?;
    kernel::transpose_matrix(bs.stack_mut(), &m)?;
    Ok(())
}

pub fn quat_to_matrix(bs: &mut BoxStack, quat: &str) -> Result<()> {
    let q = parse_floats::<4>(quat)?;
    kernel::quat_to_matrix(bs.stack_mut(), &q)?;
    Ok(())
}

pub fn matrix_to_quat(bs: &mut BoxStack, matrix: &str) -> Result<()> {
    let m = parse_floats::<16>(matrix)?;
    kernel::matrix_to_quat(bs.stack_mut(), &m)?;
    Ok(())
}

pub fn euler(bs: &mut BoxStack, x: f32, y: f32, z: f32) -> Result<()> {
    kernel::make_quat_from_euler(bs.stack_mut(), x, y, z)?;
    Ok(())
}

pub fn axis(bs: &mut BoxStack, axis: &str, radians: f32) -> Result<()> {
    let a = parse_floats::<3>(axis)?;
    kernel::make_quat_from_axis(bs.stack_mut(), &a, radians)?;
    Ok(())
}

pub fn cross(bs: &mut BoxStack, a: &str, b: &str) -> Result<()> {
    let a = parse_floats::<3>(a)?;
    let b = parse_floats::<3>(b)?;
    kernel::cross(bs.stack_mut(), &a, &b)?;
    Ok(())
}

pub fn dot(a: &str, b: &str) -> Result<()> {
    let a = parse_floats::<3>(a)?;
    let b = parse_floats::<3>(b)?;
    println!("{}", vector::dot(&a, &b));
    Ok(())
}

pub fn normalize(bs: &mut BoxStack, text: &str) -> Result<()> {
    let values = parse_list(text)?;
    let v = match values.as_slice() {
        [x, y, z] => LinearValue::Vector3([*x, *y, *z]),
        [x, y, z, w] => LinearValue::Vector4([*x, *y, *z, *w]),
        other => return Err(anyhow!("expected 3 or 4 numbers, got {}", other.len())),
    };
    kernel::normalize_vector(bs.stack_mut(), &v)?;
    Ok(())
}

pub fn mul_h(bs: &mut BoxStack, matrix: &str, vector: &str) -> Result<()> {
    let m = parse_floats::<16>(matrix)?;
    let v = parse_floats::<4>(vector)?;
    kernel::mul_h(bs.stack_mut(), &m, &v)?;
    Ok(())
}

pub fn lookat(bs: &mut BoxStack, eye: &str, at: &str, up: Option<&str>, direction: bool) -> Result<()> {
    let eye = parse_floats::<3>(eye).context("eye")?;
    let at = parse_floats::<3>(at).context("target")?;
    let up = up.map(parse_floats::<3>).transpose().context("up")?;
    if direction {
        kernel::lookto_matrix(bs.stack_mut(), &eye, &at, up.as_ref())?;
    } else {
        kernel::lookat_matrix(bs.stack_mut(), &eye, &at, up.as_ref())?;
    }
    Ok(())
}

pub fn frustum(bs: &mut BoxStack, volume: &VolumeArgs) -> Result<()> {
    bs.frustum(&volume.volume())
        .with_context(|| format!("frustum with {:?}", bs.depth_range()))?;
    Ok(())
}

pub fn ortho(bs: &mut BoxStack, volume: &VolumeArgs) -> Result<()> {
    bs.ortho(&volume.volume())
        .with_context(|| format!("ortho with {:?}", bs.depth_range()))?;
    Ok(())
}
