/// MTL 语句解释器
///
/// 把材质库文件解析为 [`Material`](crate::geometry::Material) 记录，写入同一个 [`Model`] 的材质表。
/// 数值错误和 `newmtl` 之前出现的材质语句都是致命错误，
/// 不会留下只初始化了一半的材质。

use std::path::Path;

use super::model::Model;
use super::scanner::{Keyword, Scanner, Statement};
use super::ImportContext;
use crate::core::error::{ImportError, ImportErrorKind};
use crate::core::math::Color;
use crate::geometry::material::{IlluminationModel, TextureMap, TextureSlot};

/// `newmtl` 未给出名称时使用的名称
const DEFAULT_NEW_MATERIAL_NAME: &str = "material";

/// MTL 关键字（大小写不敏感）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MtlKeyword {
    NewMaterial,
    Ambient,
    Diffuse,
    Specular,
    Emissive,
    Dissolve,
    Transparency,
    Shininess,
    OpticalDensity,
    Illumination,
    Texture(TextureSlot),
    Unknown,
}

impl Keyword for MtlKeyword {
    fn classify(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "newmtl" => MtlKeyword::NewMaterial,
            "ka" => MtlKeyword::Ambient,
            "kd" => MtlKeyword::Diffuse,
            "ks" => MtlKeyword::Specular,
            "ke" => MtlKeyword::Emissive,
            "d" => MtlKeyword::Dissolve,
            "tr" => MtlKeyword::Transparency,
            "ns" => MtlKeyword::Shininess,
            "ni" => MtlKeyword::OpticalDensity,
            "illum" => MtlKeyword::Illumination,
            "map_kd" => MtlKeyword::Texture(TextureSlot::Diffuse),
            "map_ka" => MtlKeyword::Texture(TextureSlot::Ambient),
            "map_ks" => MtlKeyword::Texture(TextureSlot::Specular),
            "map_ke" => MtlKeyword::Texture(TextureSlot::Emissive),
            "map_d" => MtlKeyword::Texture(TextureSlot::Opacity),
            "map_bump" | "bump" => MtlKeyword::Texture(TextureSlot::Bump),
            "norm" | "map_kn" => MtlKeyword::Texture(TextureSlot::Normal),
            "map_ns" => MtlKeyword::Texture(TextureSlot::SpecularExponent),
            "disp" => MtlKeyword::Texture(TextureSlot::Displacement),
            _ => MtlKeyword::Unknown,
        }
    }
}

type MtlStatement<'a> = Statement<'a, MtlKeyword>;

/// 解析一个材质库文件
pub(crate) fn interpret_mtl(
    text: &str,
    source: Option<&Path>,
    model: &mut Model,
    context: &mut ImportContext<'_>,
) -> Result<(), ImportError> {
    let locate = |err: ImportError| match source {
        Some(source) => err.in_file(source),
        None => err,
    };

    let before = model.materials().len();
    for statement in Scanner::<MtlKeyword>::new(text) {
        execute(&statement, source, model, context).map_err(locate)?;
    }
    model.end_material_library();

    crate::import_debug!(
        "material library parsed: {} new material(s)",
        model.materials().len() - before
    );
    Ok(())
}

fn execute(
    statement: &MtlStatement<'_>,
    source: Option<&Path>,
    model: &mut Model,
    context: &mut ImportContext<'_>,
) -> Result<(), ImportError> {
    match statement.keyword {
        MtlKeyword::NewMaterial => {
            let name = statement
                .rest(0)
                .unwrap_or_else(|| DEFAULT_NEW_MATERIAL_NAME.to_string());
            model.begin_material(&name);
            return Ok(());
        }
        MtlKeyword::Unknown => {
            tracing::trace!(line = statement.line, "unknown mtl keyword '{}'", statement.token);
            return Ok(());
        }
        _ => {}
    }

    let Some(material) = model.editing_material_mut() else {
        return Err(statement.error(ImportErrorKind::MissingNewMtl {
            keyword: statement.token.to_string(),
        }));
    };

    match statement.keyword {
        MtlKeyword::Ambient => set_color(statement, &mut material.ambient, source, context)?,
        MtlKeyword::Diffuse => set_color(statement, &mut material.diffuse, source, context)?,
        MtlKeyword::Specular => set_color(statement, &mut material.specular, source, context)?,
        MtlKeyword::Emissive => set_color(statement, &mut material.emissive, source, context)?,
        MtlKeyword::Dissolve => {
            // `d -halo 0.5`：halo 选项不支持，只取数值
            let index = usize::from(statement.arg(0) == Some("-halo"));
            material.alpha = statement.number(index, "dissolve")?;
        }
        MtlKeyword::Transparency => {
            let transparency: f32 = statement.number(0, "transparency")?;
            material.alpha = 1.0 - transparency;
        }
        MtlKeyword::Shininess => material.shininess = statement.number(0, "shininess")?,
        MtlKeyword::OpticalDensity => {
            material.index_of_refraction = statement.number(0, "index of refraction")?;
        }
        MtlKeyword::Illumination => {
            let code: i32 = statement.number(0, "illumination model")?;
            material.illumination = match IlluminationModel::from_code(code) {
                Some(illumination) => illumination,
                None => {
                    context.diagnostics.report(
                        source,
                        Some(statement.line),
                        format!("unsupported illumination model {}, using Gouraud", code),
                    );
                    IlluminationModel::Gouraud
                }
            };
        }
        MtlKeyword::Texture(slot) => {
            let map = parse_texture(statement)?;
            material.set_texture(slot, map);
        }
        MtlKeyword::NewMaterial | MtlKeyword::Unknown => {}
    }
    Ok(())
}

/// `Ka` / `Kd` / `Ks` / `Ke`
///
/// 支持 `r g b`、单个分量的灰度简写以及 `xyz x y z`；
/// `spectral` 曲线不支持，保留原值并产生诊断。
fn set_color(
    statement: &MtlStatement<'_>,
    color: &mut Color,
    source: Option<&Path>,
    context: &mut ImportContext<'_>,
) -> Result<(), ImportError> {
    let first = match statement.arg(0) {
        Some("spectral") => {
            context.diagnostics.report(
                source,
                Some(statement.line),
                format!("spectral '{}' colors are not supported", statement.token),
            );
            return Ok(());
        }
        Some("xyz") => 1,
        _ => 0,
    };

    let r: f32 = statement.number(first, "red component")?;
    let (g, b) = match statement.optional_number::<f32>(first + 1)? {
        Some(g) => (g, statement.number(first + 2, "blue component")?),
        None => (r, r),
    };
    *color = Color::rgb(r, g, b);
    Ok(())
}

/// 贴图选项及其参数个数
///
/// `-o`、`-s`、`-t` 接受 1 到 3 个数值，单独处理。
const TEXTURE_OPTIONS: &[(&str, usize)] = &[
    ("-blendu", 1),
    ("-blendv", 1),
    ("-bm", 1),
    ("-boost", 1),
    ("-cc", 1),
    ("-imfchan", 1),
    ("-mm", 2),
    ("-texres", 1),
    ("-type", 1),
];

/// 解析贴图语句：`map_Kd [-options...] path`
fn parse_texture(statement: &MtlStatement<'_>) -> Result<TextureMap, ImportError> {
    let args = &statement.args;
    let mut clamp = false;
    let mut index = 0;

    while let Some(&option) = args.get(index) {
        if !option.starts_with('-') {
            break;
        }
        index += 1;

        match option {
            "-clamp" => {
                clamp = args.get(index).is_some_and(|v| v.eq_ignore_ascii_case("on"));
                index += 1;
            }
            "-o" | "-s" | "-t" => {
                let mut taken = 0;
                while taken < 3 && args.get(index).is_some_and(|v| v.parse::<f32>().is_ok()) {
                    index += 1;
                    taken += 1;
                }
            }
            _ => match TEXTURE_OPTIONS.iter().find(|(name, _)| *name == option) {
                Some(&(_, count)) => index += count,
                // 未知选项：视为路径的一部分
                None => {
                    index -= 1;
                    break;
                }
            },
        }
    }

    let path = statement
        .rest(index)
        .ok_or_else(|| statement.error(ImportErrorKind::MissingArgument("texture path")))?;

    Ok(TextureMap { path, clamp })
}
