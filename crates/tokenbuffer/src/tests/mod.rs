mod arbitrary;
mod concurrency;
