use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

// ----------

use sentier::RouteTemplate;

// --------------------------------------------------------------------------------
// --------------------------------------------------------------------------------

pub fn template_matching(c: &mut Criterion) {
	let patterns = [
		"/login",
		"/users/{id}",
		"/users/{id}/orders/<rest>",
		"/files/{dir}/*.log",
		"/assets/**",
	];

	let paths = [
		"/login",
		"/users/42",
		"/users/42/orders/2024/q1",
		"/files/var/app.log",
		"/assets/css/site.css",
		"/not/registered/anywhere",
	];

	let templates =
		patterns.map(|pattern| RouteTemplate::new(pattern).expect("pattern must be valid"));

	c.bench_function("parse_templates", |b| {
		b.iter(|| {
			for pattern in patterns {
				black_box(
					RouteTemplate::new(black_box(pattern)).expect("pattern must be valid"),
				);
			}
		})
	});

	c.bench_function("match_paths", |b| {
		b.iter(|| {
			for template in &templates {
				for path in paths {
					black_box(template.matches(black_box(path)));
				}
			}
		})
	});

	c.bench_function("extract_params_and_splats", |b| {
		b.iter(|| {
			for template in &templates {
				for path in paths {
					black_box(template.path_params(black_box(path)));
					black_box(template.splats(black_box(path)));
				}
			}
		})
	});
}

criterion_group!(benches, template_matching);
criterion_main!(benches);
