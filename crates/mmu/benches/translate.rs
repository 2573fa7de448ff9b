use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swmmu_core::Mmu;

fn translate(c: &mut Criterion) {
    let mut g = c.benchmark_group("translate");

    g.bench_function("Table setup (32 bit, 4 KiB pages)", |b| {
        b.iter(|| Mmu::new(black_box(32), black_box(4096)).unwrap())
    });

    let mmu = Mmu::new(32, 4096).unwrap();
    g.bench_function("Translate sweep (32 bit, 4 KiB pages)", |b| {
        b.iter(|| {
            let mut mapped = 0u32;
            for vpn in 0..4096u32 {
                if mmu.translate(black_box((vpn << 12) | 0x10)).is_ok() {
                    mapped += 1;
                }
            }
            mapped
        })
    });

    let mmu = Mmu::new(16, 1).unwrap();
    g.bench_function("Translate sweep (16 bit, 1 B pages)", |b| {
        b.iter(|| (0..=u16::MAX as u32).filter(|va| mmu.translate(black_box(*va)).is_ok()).count())
    });
}

criterion_group!(benches, translate);
criterion_main!(benches);
