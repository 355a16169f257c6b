//! Benchmarks for index operations.
//!
//! Run with: cargo bench --bench index_benchmarks

use chrono::Utc;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::fs;
use tempfile::TempDir;
use warren::index::{IndexBuilder, IndexStore, recompute};
use warren::vault::FsVault;

// =============================================================================
// Test Data Generation
// =============================================================================

/// Folders to spread notes across
const FOLDERS: &[&str] = &[
    "projects/alpha",
    "projects/beta",
    "reference",
    "journal",
    "ideas",
];

/// Tags to assign to notes
const TAGS: &[&str] = &[
    "draft",
    "review",
    "published",
    "important",
    "rust",
    "cli",
    "async",
    "database",
];

/// Sample words for generating note content
const WORDS: &[&str] = &[
    "architecture",
    "design",
    "pattern",
    "system",
    "component",
    "interface",
    "module",
    "function",
    "testing",
    "integration",
    "performance",
    "optimization",
];

/// Generate markdown content for one note, with frontmatter, inline tags,
/// links to neighboring notes, and a couple of tasks.
fn generate_note_content(index: usize, count: usize) -> String {
    let tag1 = TAGS[index % TAGS.len()];
    let tag2 = TAGS[(index + 2) % TAGS.len()];
    let link_target = format!("note-{}", (index + 1) % count);

    let body_words: Vec<&str> = (0..50).map(|j| WORDS[(index + j) % WORDS.len()]).collect();
    let body = body_words.join(" ");

    format!(
        r#"---
tags:
  - {tag1}
  - {tag2}
---

# Note {index}

{body}

Related: [[{link_target}]] and #{tag1} notes.

- [ ] follow up on {tag2}
- [x] drafted
"#
    )
}

/// Create a temporary vault with N note files spread across folders.
fn create_test_vault(count: usize) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");

    for i in 0..count {
        let folder = FOLDERS[i % FOLDERS.len()];
        let parent = dir.path().join(folder);
        fs::create_dir_all(&parent).expect("Failed to create folder");
        let content = generate_note_content(i, count);
        fs::write(parent.join(format!("note-{i}.md")), content).expect("Failed to write note");
    }

    dir
}

/// Build an index store for a vault, returning the populated store.
fn build_index(vault_dir: &std::path::Path, index_dir: &std::path::Path) -> IndexStore {
    let vault = FsVault::open(vault_dir).expect("Failed to open vault");
    let mut store =
        IndexStore::open(index_dir.join("index.json")).expect("Failed to open index");
    let builder = IndexBuilder::new(&vault);
    builder.full_rebuild(&mut store).expect("Failed to rebuild");
    store
}

// =============================================================================
// Rebuild Benchmarks
// =============================================================================

fn bench_full_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_rebuild");

    for size in [100, 500, 1000] {
        let vault_dir = create_test_vault(size);
        let vault = FsVault::open(vault_dir.path()).expect("Failed to open vault");

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("notes", size), &size, |b, _| {
            let builder = IndexBuilder::new(&vault);
            b.iter_batched(
                || {
                    let index_dir = TempDir::new().unwrap();
                    let store = IndexStore::open(index_dir.path().join("index.json")).unwrap();
                    (store, index_dir)
                },
                |(mut store, _index_dir)| builder.full_rebuild(&mut store).unwrap(),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Aggregate Benchmarks
// =============================================================================

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");

    for size in [100, 500, 1000] {
        let vault_dir = create_test_vault(size);
        let index_dir = TempDir::new().unwrap();
        let store = build_index(vault_dir.path(), index_dir.path());
        let notes = store.document().notes.clone();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("notes", size), &size, |b, _| {
            b.iter(|| recompute(&notes, Utc::now()));
        });
    }

    group.finish();
}

// =============================================================================
// Single Document Benchmarks
// =============================================================================

fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsert");

    for size in [100, 1000] {
        let vault_dir = create_test_vault(size);
        let index_dir = TempDir::new().unwrap();
        let mut store = build_index(vault_dir.path(), index_dir.path());

        let vault = FsVault::open(vault_dir.path()).expect("Failed to open vault");
        let builder = IndexBuilder::new(&vault);
        let record = builder
            .index_document("journal/note-3.md")
            .expect("Failed to index note");

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("into_notes", size), &size, |b, _| {
            b.iter(|| store.upsert(record.clone()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_full_rebuild, bench_recompute, bench_upsert);
criterion_main!(benches);
