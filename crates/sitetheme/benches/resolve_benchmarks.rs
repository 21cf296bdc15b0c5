use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sitetheme::{
    Catalog, FixedScheme, HexColor, MemoryStore, Mode, PaletteColors, PaletteDefinition, Rgb,
    StyleSnapshot, ThemeConfig, ThemeState, contrast_ratio, ensure_contrast_ratio, gentle_color,
    resolve,
};

fn bench_color_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("sitetheme/color");
    let klein = HexColor::from_u32(0x002fa7);
    let sky = HexColor::from_u32(0x38bdf8);

    group.bench_function("HexColor::parse", |b| {
        b.iter(|| black_box(HexColor::parse(black_box("#002FA7"))));
    });

    group.bench_function("contrast_ratio", |b| {
        b.iter(|| black_box(contrast_ratio(black_box(klein.rgb()), Rgb::WHITE)));
    });

    group.bench_function("ensure_contrast/passing", |b| {
        b.iter(|| black_box(ensure_contrast_ratio(black_box(klein), HexColor::WHITE, 4.5)));
    });

    group.bench_function("ensure_contrast/darkening", |b| {
        b.iter(|| black_box(ensure_contrast_ratio(black_box(sky), HexColor::WHITE, 4.5)));
    });

    group.bench_function("gentle_color/generated", |b| {
        b.iter(|| black_box(gentle_color(black_box(sky))));
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("sitetheme/resolve");
    let klein = PaletteDefinition::klein();
    let custom = PaletteDefinition::new(
        "sky",
        "Sky",
        PaletteColors {
            primary: "#38bdf8".into(),
            ..PaletteColors::klein()
        },
    );

    group.bench_function("klein/light", |b| {
        b.iter(|| black_box(resolve(black_box(&klein), Mode::Light)));
    });

    group.bench_function("klein/dark", |b| {
        b.iter(|| black_box(resolve(black_box(&klein), Mode::Dark)));
    });

    group.bench_function("untabled/dark", |b| {
        b.iter(|| black_box(resolve(black_box(&custom), Mode::Dark)));
    });

    group.bench_function("to_css", |b| {
        let theme = resolve(&klein, Mode::Dark).expect("resolve");
        b.iter(|| black_box(theme.to_css(":root")));
    });

    group.finish();
}

fn bench_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("sitetheme/state");
    let mut state = ThemeState::new(
        Catalog::builtin(),
        ThemeConfig::default(),
        MemoryStore::new(),
        StyleSnapshot::new(),
        FixedScheme::LIGHT,
    );

    group.bench_function("toggle_mode", |b| {
        b.iter(|| black_box(state.toggle_mode()));
    });

    group.finish();
}

criterion_group!(
    resolve_benches,
    bench_color_math,
    bench_resolve,
    bench_state
);
criterion_main!(resolve_benches);
