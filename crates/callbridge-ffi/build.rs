fn main() {
    uniffi::generate_scaffolding("src/callbridge.udl").unwrap();
}
