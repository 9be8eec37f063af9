use clap::Parser;
use meshweld::derive::NanPolicy;

mod cli;
mod obj;

use cli::*;
use obj::DeriveOptions;

#[cfg(all(feature = "jemalloc", not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_filter, cli.log_format);

    let options = DeriveOptions {
        normals: !cli.no_normals,
        tangents: !cli.no_tangents,
        nan_policy: if cli.tolerate_nan {
            NanPolicy::Tolerate
        } else {
            NanPolicy::Fail
        },
    };

    let mut failed = false;
    for path in &cli.files {
        let _span = tracing::info_span!("file", path = ?path).entered();
        let models = match obj::load(path) {
            Ok(models) => models,
            Err(e) => {
                tracing::error!(error = %e, "couldn't load OBJ file");
                failed = true;
                continue;
            }
        };
        for model in &models {
            match obj::weld(model, &options) {
                Ok((_, report)) => println!(
                    "{}: {}: {} source vertices, {} polygons -> {} vertices, {} triangles, {} groups{}{}",
                    path.display(),
                    report.name,
                    report.source_vertices,
                    report.polygons,
                    report.vertices,
                    report.triangles,
                    report.groups,
                    if report.generated_normals { ", +normals" } else { "" },
                    if report.generated_tangents { ", +tangents" } else { "" },
                ),
                Err(e) => {
                    tracing::error!(model = %model.name, error = %e, "couldn't weld model");
                    failed = true;
                }
            }
        }
    }

    if failed {
        std::process::ExitCode::FAILURE
    } else {
        std::process::ExitCode::SUCCESS
    }
}
