/*
Control de juego por pose corporal en tiempo real - Rust puro

Sistema que:
1. Recibe detecciones de pose por TCP (una línea JSON por frame, motor externo)
2. Mantiene una ventana deslizante con los últimos 5 registros por frame
3. Clasifica la acción de combate con reglas sobre firmas cinemáticas
4. Reenvía el carácter de comando al actuador del juego en cada frame listo

Para compilar y ejecutar:
    ./target/release/pugiloscopio 0.0.0.0:7200 127.0.0.1:7300

Para debug con teclado:
    sg input -c './target/debug/pugiloscopio'
*/

use anyhow::Result;
use crossbeam_channel::{bounded, select, unbounded};
use std::env;

use pugiloscopio::classifier::{ClassifierParams, FightAction, GestureClassifier};
use pugiloscopio::command::{CommandChannel, HighlightState};
use pugiloscopio::pose::{get_stats, start_pose_receiver, PoseDetection};
use pugiloscopio::types::flatten_first_subject;
use pugiloscopio::window::RecordWindow;

fn main() -> Result<()> {
    println!("🥊 Pose Fight Control - Rust\n");

    // Obtener direcciones desde argumentos (opcional)
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("🔧 Modo: DEBUG - Teclado Interactivo\n");
        return debug_mode();
    }

    let pose_addr = args[1].clone();
    let command_addr = args.get(2).cloned();

    println!("🔧 Modo: Tiempo Real");
    println!("🎯 Fuente de pose: {}", pose_addr);
    match &command_addr {
        Some(addr) => println!("🎮 Actuador: {}\n", addr),
        None => println!("🎮 Actuador: deshabilitado (solo display)\n"),
    }

    // Canal para recibir detecciones del motor de pose
    let (tx, rx) = bounded::<PoseDetection>(100);

    // Lanzar hilo receptor en segundo plano
    std::thread::spawn(move || {
        if let Err(e) = start_pose_receiver(&pose_addr, tx) {
            eprintln!("❌ Error en el receptor de pose: {}", e);
        }
    });

    // Canal e hilo del actuador
    let (tx_action, rx_action) = unbounded::<FightAction>();
    let forwarding = command_addr.is_some();

    if let Some(addr) = command_addr {
        std::thread::spawn(move || {
            let mut channel = match CommandChannel::connect(&addr) {
                Ok(channel) => {
                    println!("✅ Canal de comandos conectado ({})", addr);
                    channel
                }
                Err(e) => {
                    eprintln!("❌ No se pudo conectar el canal de comandos: {}", e);
                    return;
                }
            };

            while let Ok(action) = rx_action.recv() {
                if let Err(e) = channel.send(action) {
                    // El lazo de frames sigue en modo solo-display
                    eprintln!("❌ Error enviando comando {:?}: {}", action, e);
                }
            }
        });
    }

    let classifier = GestureClassifier::new(ClassifierParams::default());
    let mut window = RecordWindow::new();
    let mut highlight = HighlightState::new();
    let mut frames_without_subject = 0u32;

    println!("🎬 Iniciando reconocimiento en tiempo real...\n");

    loop {
        select! {
            recv(rx) -> msg => {
                match msg {
                    Ok(detection) => {
                        let record = match flatten_first_subject(&detection) {
                            Some(record) => record,
                            None => {
                                frames_without_subject += 1;
                                continue;
                            }
                        };

                        window.push(record);
                        let snapshot = match window.snapshot() {
                            Some(snapshot) => snapshot,
                            None => continue,
                        };

                        match classifier.classify(&snapshot) {
                            Ok(action) => {
                                if let Some(previous) = highlight.update(action) {
                                    println!(
                                        "💡 Resaltado: {} → {}",
                                        previous.label(),
                                        action.label()
                                    );
                                }

                                // El comando se reenvía en cada frame listo,
                                // repetido incluido; el flanco solo gobierna
                                // el resaltado
                                if forwarding && action != FightAction::None {
                                    let _ = tx_action.send(action);
                                }
                            }
                            Err(e) => {
                                eprintln!("⚠️  Frame descartado: {}", e);
                            }
                        }
                    }
                    Err(_) => {
                        let stats = get_stats();
                        println!(
                            "📡 Fuente de pose desconectada, saliendo (frames={} rechazados={} sin-sujeto={})",
                            stats.frames, stats.rejected, frames_without_subject
                        );
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Modo DEBUG: lee teclas y clasifica capturas CSV correspondientes
fn debug_mode() -> Result<()> {
    use evdev::{Device, InputEventKind, Key};
    use pugiloscopio::csv_loader::load_records_from_csv;
    use std::fs;
    use std::path::PathBuf;

    println!("🔍 Buscando teclado...");

    let mut keyboard_device: Option<Device> = None;

    for entry in fs::read_dir("/dev/input")? {
        if let Ok(entry) = entry {
            let path = entry.path();
            if let Some(name) = path.file_name() {
                if name.to_string_lossy().starts_with("event") {
                    if let Ok(device) = Device::open(&path) {
                        if let Some(dev_name) = device.name() {
                            let dev_name_lc = dev_name.to_lowercase();
                            if dev_name_lc.contains("keyboard")
                                || dev_name_lc.contains("at translated")
                            {
                                println!(
                                    "✅ Teclado encontrado: {} ({})",
                                    dev_name,
                                    path.display()
                                );
                                keyboard_device = Some(device);
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    let mut device = keyboard_device.ok_or_else(|| {
        anyhow::anyhow!("No se encontró ningún dispositivo de teclado en /dev/input")
    })?;

    println!("✅ Captura de teclado global activada\n");

    let classifier = GestureClassifier::new(ClassifierParams::default());

    println!("✅ Sistema listo\n");
    println!("Presiona teclas para clasificar capturas:");
    println!("  p → puñetazo");
    println!("  k → patada");
    println!("  d → golpe-abajo");
    println!("  u → golpe-arriba");
    println!("  b → bloqueo");
    println!("  q → salir\n");

    let key_to_folder: std::collections::HashMap<Key, (&str, &str)> = [
        (Key::KEY_P, ("capturas/punetazo", "p")),
        (Key::KEY_K, ("capturas/patada", "k")),
        (Key::KEY_D, ("capturas/golpe-abajo", "d")),
        (Key::KEY_U, ("capturas/golpe-arriba", "u")),
        (Key::KEY_B, ("capturas/bloqueo", "b")),
    ]
    .iter()
    .cloned()
    .collect();

    println!("🎧 Escuchando teclas globales...\n");

    loop {
        for ev in device.fetch_events()? {
            if let InputEventKind::Key(key) = ev.kind() {
                if ev.value() == 1 {
                    if key == Key::KEY_Q {
                        println!("\n👋 Saliendo...");
                        return Ok(());
                    }

                    if let Some((folder_name, key_char)) = key_to_folder.get(&key) {
                        println!("\n🔑 Tecla presionada: '{}'", key_char);
                        println!("📂 Buscando CSV en: {}/", folder_name);

                        let folder_path = PathBuf::from(folder_name);

                        if !folder_path.exists() {
                            eprintln!("❌ Carpeta no existe: {}", folder_name);
                            continue;
                        }

                        let csv_files: Vec<PathBuf> = fs::read_dir(&folder_path)?
                            .filter_map(|entry| entry.ok())
                            .map(|entry| entry.path())
                            .filter(|path| {
                                path.extension()
                                    .and_then(|ext| ext.to_str())
                                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                                    .unwrap_or(false)
                            })
                            .collect();

                        if csv_files.is_empty() {
                            eprintln!("❌ No hay archivos CSV en {}", folder_name);
                            continue;
                        }

                        use rand::Rng;
                        let random_idx = rand::thread_rng().gen_range(0..csv_files.len());
                        let csv_path = &csv_files[random_idx];
                        let file_name = csv_path
                            .file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("unknown.csv");

                        println!("📄 Archivo: {}", file_name);

                        match load_records_from_csv(csv_path) {
                            Ok(records) => {
                                let mut window = RecordWindow::new();
                                let mut last_action = FightAction::None;
                                let mut faults = 0u32;

                                for record in records {
                                    window.push(record);
                                    let snapshot = match window.snapshot() {
                                        Some(snapshot) => snapshot,
                                        None => continue,
                                    };

                                    match classifier.classify(&snapshot) {
                                        Ok(action) => {
                                            if action != FightAction::None {
                                                last_action = action;
                                            }
                                        }
                                        Err(_) => faults += 1,
                                    }
                                }

                                println!(
                                    "🎯 Acción reconocida: {} ('{}')",
                                    last_action.label(),
                                    last_action.command_char()
                                );
                                if faults > 0 {
                                    println!("⚠️  {} frames descartados por timing", faults);
                                }
                            }
                            Err(e) => {
                                eprintln!("❌ Error cargando CSV: {}", e);
                            }
                        }
                    }
                }
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(10));
    }
}
