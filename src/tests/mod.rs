// Tests module
// Registry: round-trip, removal, limit and skip-corrupt laws over generated inputs
// Routing: allowlist laws and the concrete routing scenarios
// Concurrency: shared registry and router across threads
