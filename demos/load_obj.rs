/// OBJ 场景加载示例
///
/// 演示如何使用 wavefront_scene 导入 OBJ 文件并遍历场景图。
///
/// 运行方式：
/// ```text
/// cargo run --example load_obj -- tests/fixtures/cube.obj [config.toml]
/// ```

use anyhow::Context;
use std::path::Path;
use wavefront_scene::core::config::Config;
use wavefront_scene::core::log;
use wavefront_scene::geometry::mesh::PrimitiveKind;
use wavefront_scene::geometry::{Node, Scene};
use wavefront_scene::{ObjLoader, SceneLoader};

fn print_node(scene: &Scene, node: &Node, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}节点 '{}'", indent, node.name);

    for mesh in scene.meshes_of(node) {
        let material = scene
            .material_of(mesh)
            .map(|m| m.name.as_str())
            .unwrap_or("<none>");
        println!("{}  网格 '{}' (材质 '{}')", indent, mesh.name, material);
        println!(
            "{}    顶点数: {}  法线: {}  UV: {}",
            indent,
            mesh.vertex_count(),
            mesh.has_normals,
            mesh.has_texcoords
        );
        for kind in PrimitiveKind::ALL {
            let count = mesh.primitive_count(kind);
            if count > 0 {
                println!("{}    {:?}: {}", indent, kind, count);
            }
        }
        if let Err(e) = mesh.validate() {
            println!("{}    ✗ 数据验证失败: {}", indent, e);
        }
    }

    for child in &node.children {
        print_node(scene, child, depth + 1);
    }
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let obj_path = args.next().unwrap_or_else(|| "tests/fixtures/cube.obj".to_string());
    let config = match args.next() {
        Some(path) => Config::from_file(&path).with_context(|| format!("加载配置 {} 失败", path))?,
        None => Config::default(),
    };

    log::init_from_config(&config.logging).context("初始化日志系统失败")?;

    println!("=== wavefront_scene OBJ 加载示例 ===\n");
    println!("正在加载: {}", obj_path);

    let imported = ObjLoader::new()
        .with_config(config.import.clone())
        .load_from_file(Path::new(&obj_path))
        .with_context(|| format!("导入 {} 失败", obj_path))?;

    for diagnostic in &imported.diagnostics {
        println!("警告: {}", diagnostic);
    }

    let scene = &imported.scene;
    println!("\n✓ 加载成功！\n");
    println!("  节点数: {}", scene.node_count());
    println!("  网格数: {}", scene.meshes.len());
    println!("  顶点数: {}", scene.vertex_count());
    println!("  材质: {:?}\n", scene.materials.iter().map(|m| &m.name).collect::<Vec<_>>());

    print_node(scene, &scene.root, 0);

    println!("\n=== 示例完成 ===");
    Ok(())
}
