//! Benchmarks for product assembly and metadata parsing.
//!
//! These cover the CPU-bound parts of a dashboard run; listing, cloning and
//! the guideline checks are dominated by I/O and are not measured here.

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trg_checks::checks::container::final_base_image;
use trg_checks::metadata::{self, Metadata};
use trg_checks::product::{products_from_metadata, RepoInfo, Repository};

/// An organization of `products` products with `members` repositories each.
fn organization(products: usize, members: usize) -> BTreeMap<String, RepoInfo> {
    let mut repos = BTreeMap::new();
    for p in 0..products {
        let leader = format!("https://github.com/eclipse-tractusx/product-{}", p);
        for m in 0..members {
            let url = if m == 0 {
                leader.clone()
            } else {
                format!("{}-component-{}", leader, m)
            };
            let name = url.rsplit('/').next().unwrap_or_default().to_string();
            let metadata = Metadata {
                product_name: format!("Product {}", p),
                leading_repository: leader.to_uppercase(),
                repositories: Vec::new(),
            };
            repos.insert(url.clone(), RepoInfo::new(&Repository::new(name, url), metadata));
        }
    }
    repos
}

fn bench_products_from_metadata(c: &mut Criterion) {
    let mut group = c.benchmark_group("products_from_metadata");

    for (products, members) in [(10, 3), (100, 5), (500, 8)] {
        let repos = organization(products, members);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", products, members)),
            &repos,
            |b, repos| b.iter(|| products_from_metadata(black_box(repos))),
        );
    }

    group.finish();
}

fn bench_metadata_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("metadata_parse");

    let minimal = b"product: Portal\nleadingRepository: https://github.com/eclipse-tractusx/portal\n";
    group.bench_function("minimal", |b| b.iter(|| metadata::parse(black_box(minimal))));

    let mut full = String::from(
        "product: Portal\nleadingRepository: https://github.com/eclipse-tractusx/portal\nrepositories:\n",
    );
    for i in 0..20 {
        full.push_str(&format!(
            "  - name: portal-{i}\n    usage: component {i}\n    url: https://github.com/eclipse-tractusx/portal-{i}\n"
        ));
    }
    group.bench_function("with_repositories", |b| {
        b.iter(|| metadata::parse(black_box(full.as_bytes())))
    });

    group.finish();
}

fn bench_final_base_image(c: &mut Criterion) {
    let dockerfile = r#"
ARG JAVA_VERSION=17
FROM maven:3-eclipse-temurin-${JAVA_VERSION} AS build
COPY . /src
RUN mvn -f /src/pom.xml package

FROM eclipse-temurin:${JAVA_VERSION}-jre-alpine AS runtime
COPY --from=build /src/target/app.jar /app.jar
USER 10000:10000
ENTRYPOINT ["java", "-jar", "/app.jar"]
"#;

    c.bench_function("final_base_image", |b| {
        b.iter(|| final_base_image(black_box(dockerfile)))
    });
}

criterion_group!(
    benches,
    bench_products_from_metadata,
    bench_metadata_parse,
    bench_final_base_image
);
criterion_main!(benches);
