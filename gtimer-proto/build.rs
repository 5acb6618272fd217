use std::path::PathBuf;

fn main() {
    let protos = [
        PathBuf::from("protos/greetertimer.proto"),
        PathBuf::from("protos/greeting.proto"),
    ];
    for proto in &protos {
        println!("cargo:rerun-if-changed={}", proto.display());
    }
    println!("cargo:rerun-if-env-changed=PROTOC");

    // External protoc only. Either set `PROTOC=/path/to/protoc` or ensure `protoc` is on PATH.
    let protoc = std::env::var_os("PROTOC").filter(|v| !v.is_empty());
    if protoc.is_none() {
        match std::process::Command::new("protoc")
            .arg("--version")
            .output()
        {
            Ok(out) if out.status.success() => {}
            Ok(out) => {
                let exit = out.status.code().unwrap_or(-1);
                let stderr = String::from_utf8_lossy(&out.stderr);
                panic!(
                    "protoc is required to build gtimer-proto but PATH 'protoc' failed (exit={exit}): {stderr}\n\
                     Install protoc (protobuf compiler) or set PROTOC=/path/to/protoc"
                );
            }
            Err(e) => {
                panic!(
                    "protoc is required to build gtimer-proto but was not found on PATH: {e}\n\
                     Install protoc (protobuf compiler) or set PROTOC=/path/to/protoc"
                );
            }
        }
    }

    let includes = [PathBuf::from("protos")];

    if let Err(e) = tonic_prost_build::configure().compile_protos(&protos, &includes) {
        panic!("failed to compile gtimer protos: {e}");
    }
}
