/// OBJ 语句解释器
///
/// 逐条处理 OBJ 语句，把顶点数据、面和对象/分组结构累积到 [`Model`] 中。
/// 遇到 `mtllib` 时同步调用 MTL 解释器，材质库解析完成后才继续处理下一条语句。

use std::path::{Path, PathBuf};

use super::model::{resolve_index, Corner, FaceKind, MaterialRef, Model};
use super::mtl::interpret_mtl;
use super::scanner::{Keyword, Scanner, Statement};
use super::ImportContext;
use crate::core::error::{ImportError, ImportErrorKind};
use crate::core::math::{Vector2, Vector3};

/// 未命名分组使用的名称
const DEFAULT_GROUP_NAME: &str = "default";

/// OBJ 关键字
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjKeyword {
    Vertex,
    Normal,
    TexCoord,
    Face,
    Line,
    Point,
    UseMaterial,
    MaterialLibrary,
    Group,
    Object,
    Smoothing,
    MergingGroup,
    Unknown,
}

impl Keyword for ObjKeyword {
    fn classify(token: &str) -> Self {
        match token {
            "v" => ObjKeyword::Vertex,
            "vn" => ObjKeyword::Normal,
            "vt" => ObjKeyword::TexCoord,
            "f" => ObjKeyword::Face,
            "l" => ObjKeyword::Line,
            "p" => ObjKeyword::Point,
            "usemtl" => ObjKeyword::UseMaterial,
            "mtllib" => ObjKeyword::MaterialLibrary,
            "g" => ObjKeyword::Group,
            "o" => ObjKeyword::Object,
            "s" => ObjKeyword::Smoothing,
            "mg" => ObjKeyword::MergingGroup,
            _ => ObjKeyword::Unknown,
        }
    }
}

type ObjStatement<'a> = Statement<'a, ObjKeyword>;

/// OBJ 解释器
///
/// 持有当前文件的位置信息；`Model` 和导入上下文按参数传入。
pub(crate) struct ObjInterpreter<'a> {
    /// 当前 OBJ 文件（从内存导入时为空）
    source: Option<&'a Path>,

    /// 解析 `mtllib` 相对路径的基准目录
    base_dir: &'a Path,
}

impl<'a> ObjInterpreter<'a> {
    pub(crate) fn new(source: Option<&'a Path>, base_dir: &'a Path) -> Self {
        Self { source, base_dir }
    }

    /// 处理整个 OBJ 文本
    pub(crate) fn run(
        &self,
        text: &str,
        model: &mut Model,
        context: &mut ImportContext<'_>,
    ) -> Result<(), ImportError> {
        for statement in Scanner::<ObjKeyword>::new(text) {
            self.execute(&statement, model, context)
                .map_err(|err| self.locate(err))?;
        }
        Ok(())
    }

    fn locate(&self, err: ImportError) -> ImportError {
        match self.source {
            Some(source) => err.in_file(source),
            None => err,
        }
    }

    fn execute(
        &self,
        statement: &ObjStatement<'_>,
        model: &mut Model,
        context: &mut ImportContext<'_>,
    ) -> Result<(), ImportError> {
        match statement.keyword {
            ObjKeyword::Vertex => {
                // 可选的 w 分量被忽略
                let x = statement.number(0, "vertex x")?;
                let y = statement.number(1, "vertex y")?;
                let z = statement.number(2, "vertex z")?;
                model.vertices.push(Vector3::new(x, y, z));
            }
            ObjKeyword::Normal => {
                let x = statement.number(0, "normal x")?;
                let y = statement.number(1, "normal y")?;
                let z = statement.number(2, "normal z")?;
                model.normals.push(Vector3::new(x, y, z));
            }
            ObjKeyword::TexCoord => {
                let u = statement.number(0, "texture u")?;
                let v = statement.optional_number(1)?.unwrap_or(0.0);
                model.texcoords.push(Vector2::new(u, v));
            }
            ObjKeyword::Face => self.face(statement, FaceKind::Polygon, model, context)?,
            ObjKeyword::Line => self.face(statement, FaceKind::Line, model, context)?,
            ObjKeyword::Point => self.face(statement, FaceKind::Point, model, context)?,
            ObjKeyword::UseMaterial => self.use_material(statement, model, context),
            ObjKeyword::MaterialLibrary => self.material_library(statement, model, context)?,
            ObjKeyword::Group => {
                // 与 `o` 一致，整行参数是一个名称
                let name = statement.rest(0).unwrap_or_else(|| DEFAULT_GROUP_NAME.to_string());
                model.select_group(&name);
            }
            ObjKeyword::Object => {
                if let Some(name) = statement.rest(0) {
                    model.select_object(&name);
                }
            }
            ObjKeyword::Smoothing | ObjKeyword::MergingGroup => {
                tracing::trace!(line = statement.line, "ignoring '{}'", statement.token);
            }
            ObjKeyword::Unknown => {
                tracing::trace!(line = statement.line, "unknown keyword '{}'", statement.token);
            }
        }
        Ok(())
    }

    /// `f` / `l` / `p`
    fn face(
        &self,
        statement: &ObjStatement<'_>,
        kind: FaceKind,
        model: &mut Model,
        context: &mut ImportContext<'_>,
    ) -> Result<(), ImportError> {
        let mut corners = Vec::with_capacity(statement.args.len());
        let mut dropped = Vec::new();
        for (number, arg) in statement.args.iter().enumerate() {
            match parse_corner(statement, arg, model)? {
                Some(corner) => corners.push(corner),
                None => dropped.push(number + 1),
            }
        }

        if corners.is_empty() {
            context.diagnostics.report(
                self.source,
                Some(statement.line),
                format!("'{}' statement has no position indices, dropped", statement.token),
            );
            return Ok(());
        }
        if !dropped.is_empty() {
            context.diagnostics.report(
                self.source,
                Some(statement.line),
                format!(
                    "'{}' corner(s) {:?} have no position index, dropped",
                    statement.token, dropped
                ),
            );
        }

        model.add_face(kind, corners, statement.line);
        Ok(())
    }

    /// `usemtl`
    fn use_material(
        &self,
        statement: &ObjStatement<'_>,
        model: &mut Model,
        context: &mut ImportContext<'_>,
    ) {
        let name = statement.rest(0).unwrap_or_default();
        match model.find_material(&name) {
            Some(index) => model.use_material(MaterialRef::Library(index)),
            None => {
                context.diagnostics.report(
                    self.source,
                    Some(statement.line),
                    format!("unknown material '{}', using default material", name),
                );
                model.fall_back_to_default_material();
            }
        }
    }

    /// `mtllib`
    fn material_library(
        &self,
        statement: &ObjStatement<'_>,
        model: &mut Model,
        context: &mut ImportContext<'_>,
    ) -> Result<(), ImportError> {
        if !context.config.follow_mtllib {
            crate::import_debug!(line = statement.line, "skipping mtllib");
            return Ok(());
        }

        for path in self.library_paths(statement, context) {
            let bytes = match context.fs.read(&path) {
                Ok(bytes) => bytes,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    context.diagnostics.report(
                        self.source,
                        Some(statement.line),
                        format!("material library '{}' not found", path.display()),
                    );
                    continue;
                }
                Err(err) => {
                    return Err(ImportError::new(ImportErrorKind::Unreadable(err)).in_file(path));
                }
            };

            let text = String::from_utf8_lossy(&bytes);
            interpret_mtl(&text, Some(&path), model, context)?;
            crate::import_debug!(
                materials = ?model.material_names().collect::<Vec<_>>(),
                "loaded material library {}",
                path.display()
            );
        }
        Ok(())
    }

    /// `mtllib` 的文件列表
    ///
    /// 整行作为一个带空格的文件名存在时优先使用，否则每个参数是一个文件。
    fn library_paths(&self, statement: &ObjStatement<'_>, context: &ImportContext<'_>) -> Vec<PathBuf> {
        if statement.args.len() > 1 {
            if let Some(joined) = statement.rest(0) {
                let path = self.base_dir.join(joined);
                if context.fs.exists(&path) {
                    return vec![path];
                }
            }
        }
        statement.args.iter().map(|arg| self.base_dir.join(arg)).collect()
    }
}

/// 解析一个面角点 `position[/texcoord[/normal]]`
///
/// 位置索引为空时返回 `None`，该角点被丢弃。
fn parse_corner(
    statement: &ObjStatement<'_>,
    arg: &str,
    model: &Model,
) -> Result<Option<Corner>, ImportError> {
    let mut parts = arg.split('/');
    let position = parts.next().unwrap_or("");
    let texcoord = parts.next().unwrap_or("");
    let normal = parts.next().unwrap_or("");

    let resolve = |token: &str, pool_len: usize| -> Result<Option<usize>, ImportError> {
        if token.is_empty() {
            return Ok(None);
        }
        let raw: i64 = statement.parse_token(token)?;
        resolve_index(raw, pool_len)
            .map(Some)
            .map_err(|kind| statement.error(kind))
    };

    let Some(position) = resolve(position, model.vertices.len())? else {
        return Ok(None);
    };

    Ok(Some(Corner {
        position,
        texcoord: resolve(texcoord, model.texcoords.len())?,
        normal: resolve(normal, model.normals.len())?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ImportConfig;
    use crate::geometry::loaders::fs::MemoryFileSystem;

    fn run(text: &str, fs: &MemoryFileSystem) -> (Model, Vec<crate::geometry::loaders::Diagnostic>) {
        let config = ImportConfig::default();
        let mut context = ImportContext::new(fs, &config);
        let mut model = Model::new();
        ObjInterpreter::new(Some(Path::new("test.obj")), Path::new(""))
            .run(text, &mut model, &mut context)
            .unwrap();
        (model, context.diagnostics.into_vec())
    }

    fn run_err(text: &str) -> ImportError {
        let fs = MemoryFileSystem::new();
        let config = ImportConfig::default();
        let mut context = ImportContext::new(&fs, &config);
        let mut model = Model::new();
        ObjInterpreter::new(Some(Path::new("test.obj")), Path::new(""))
            .run(text, &mut model, &mut context)
            .unwrap_err()
    }

    #[test]
    fn test_keyword_classification() {
        assert_eq!(ObjKeyword::classify("vt"), ObjKeyword::TexCoord);
        assert_eq!(ObjKeyword::classify("mg"), ObjKeyword::MergingGroup);
        assert_eq!(ObjKeyword::classify("cstype"), ObjKeyword::Unknown);
    }

    #[test]
    fn test_vertex_pools() {
        let (model, _) = run(
            "v 1 2 3\nv 4 5 6 1.0\nvn 0 1 0\nvt 0.25 0.75\nvt 0.5\n",
            &MemoryFileSystem::new(),
        );

        assert_eq!(model.vertices, vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)]);
        assert_eq!(model.normals, vec![Vector3::new(0.0, 1.0, 0.0)]);
        assert_eq!(model.texcoords[0], Vector2::new(0.25, 0.75));
        assert_eq!(model.texcoords[1], Vector2::new(0.5, 0.0));
    }

    #[test]
    fn test_face_corner_formats() {
        let (model, _) = run(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2//1 3/1\n",
            &MemoryFileSystem::new(),
        );

        let corners = &model.faces[0].corners;
        assert_eq!(corners[0], Corner { position: 0, texcoord: Some(0), normal: Some(0) });
        assert_eq!(corners[1], Corner { position: 1, texcoord: None, normal: Some(0) });
        assert_eq!(corners[2], Corner { position: 2, texcoord: Some(0), normal: None });
    }

    #[test]
    fn test_relative_indices() {
        let (model, _) = run("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n", &MemoryFileSystem::new());

        let positions: Vec<_> = model.faces[0].corners.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_face_without_positions_is_dropped() {
        let (model, diagnostics) = run("v 0 0 0\nf /1 //1\n", &MemoryFileSystem::new());

        assert!(model.faces.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Some(2));
    }

    #[test]
    fn test_corner_without_position_is_reported() {
        let (model, diagnostics) = run(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 /1 3 4\n",
            &MemoryFileSystem::new(),
        );

        assert_eq!(model.faces[0].corners.len(), 3);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Some(5));
        assert!(diagnostics[0].message.contains("[2]"));
    }

    #[test]
    fn test_group_and_object_names_use_whole_line() {
        let (model, _) = run(
            "v 0 0 0\ng my part\np 1\no my part\np 1\n",
            &MemoryFileSystem::new(),
        );

        assert_eq!(model.objects.len(), 1);
        assert_eq!(model.objects[0].name, "my part");
        assert_eq!(model.groups["my part"], vec![0, 1]);
    }

    #[test]
    fn test_line_and_point_kinds() {
        let (model, _) = run("v 0 0 0\nv 1 0 0\nl 1 2\np 1\n", &MemoryFileSystem::new());

        assert_eq!(model.faces[0].kind, FaceKind::Line);
        assert_eq!(model.faces[1].kind, FaceKind::Point);
    }

    #[test]
    fn test_object_statement() {
        let (model, _) = run(
            "o first\nv 0 0 0\np 1\no\no second\np 1\no first\np 1\n",
            &MemoryFileSystem::new(),
        );

        let names: Vec<_> = model.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(model.meshes[model.objects[0].meshes[0]].faces, vec![0, 2]);
    }

    #[test]
    fn test_smoothing_and_unknown_are_ignored() {
        let (model, diagnostics) = run("s 1\nmg 1 0.5\ncstype bezier\nv 0 0 0\n", &MemoryFileSystem::new());

        assert_eq!(model.vertices.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_mtllib_loads_materials() {
        let fs = MemoryFileSystem::new().with_file("a.mtl", "newmtl red\nKd 1 0 0\n");
        let (model, diagnostics) = run("mtllib a.mtl\nusemtl red\nv 0 0 0\np 1\n", &fs);

        assert!(diagnostics.is_empty());
        assert_eq!(model.find_material("red"), Some(0));
        assert_eq!(model.meshes[0].material, MaterialRef::Library(0));
    }

    #[test]
    fn test_mtllib_with_spaces_and_multiple_files() {
        let fs = MemoryFileSystem::new()
            .with_file("my materials.mtl", "newmtl a\n")
            .with_file("one.mtl", "newmtl b\n")
            .with_file("two.mtl", "newmtl c\n");
        let (model, diagnostics) = run("mtllib my materials.mtl\nmtllib one.mtl two.mtl\n", &fs);

        assert!(diagnostics.is_empty());
        assert_eq!(model.material_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_mtllib_is_recoverable() {
        let (model, diagnostics) = run("mtllib missing.mtl\nv 0 0 0\n", &MemoryFileSystem::new());

        assert_eq!(model.vertices.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("missing.mtl"));
    }

    #[test]
    fn test_invalid_number_is_fatal() {
        let err = run_err("v 0 0 0\nv 1 oops 0\n");

        assert!(matches!(err.kind, ImportErrorKind::InvalidNumber(ref t) if t == "oops"));
        assert_eq!(err.line, Some(2));
        assert_eq!(err.file, Some(PathBuf::from("test.obj")));
    }

    #[test]
    fn test_zero_index_is_fatal() {
        let err = run_err("v 0 0 0\nf 0 1 1\n");
        assert!(matches!(err.kind, ImportErrorKind::ZeroIndex));
    }

    #[test]
    fn test_missing_coordinate_is_fatal() {
        let err = run_err("vn 0 1\n");
        assert!(matches!(err.kind, ImportErrorKind::MissingArgument("normal z")));
    }
}
